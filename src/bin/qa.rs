//! Terminal front-end for the Q&A board.
//!
//! Usage:
//!   qa list
//!   qa search upgrading
//!   qa ask --title "How do I configure X?" --content "..." --name Alice
//!   qa login --username admin
//!   qa answer 1 "Try upgrading to version 2"

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use qa_board::client::{ApiClient, ClientError, ClientState, FileSessionStore};
use qa_board::forum::{NewQuestion, Question};
use qa_board::logging::init_cli_logging;

#[derive(Parser, Debug)]
#[command(version, about = "Browse and answer questions on a Q&A board")]
struct Cli {
    /// API base URL including the /api prefix
    #[arg(long, env = "QA_API_URL", default_value = "http://localhost:5000/api")]
    api_url: String,

    /// Where the login session is kept
    #[arg(long, env = "QA_SESSION_FILE", default_value = ".qa_session.json")]
    session: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all questions, newest first
    List,
    /// Show one question with its answers
    Show { id: i64 },
    /// Search titles, bodies, authors and answers
    Search {
        term: String,
        /// Ask the server instead of filtering locally
        #[arg(long)]
        remote: bool,
    },
    /// Post a new question
    Ask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Log in as an admin (password read from stdin)
    Login {
        #[arg(long)]
        username: String,
    },
    Logout,
    /// Show the logged-in admin
    Whoami,
    /// Answer a question
    Answer { question_id: i64, content: String },
    /// Replace the text of your own answer
    EditAnswer { answer_id: i64, content: String },
    /// Delete your own answer
    DeleteAnswer { answer_id: i64 },
    /// Delete a question and all of its answers
    DeleteQuestion { question_id: i64 },
}

fn render(q: &Question) {
    println!("#{} {}", q.id, q.title);
    println!(
        "   by {} on {}",
        q.author_name,
        q.created_at.format("%Y-%m-%d %H:%M")
    );
    println!("   {}", q.content);
    if q.answers.is_empty() {
        println!("   (no answers yet)");
    }
    for a in &q.answers {
        let edited = if a.is_edited() { " (edited)" } else { "" };
        println!(
            "   -> [{}] {}: {}{}",
            a.id, a.admin_username, a.content, edited
        );
    }
    println!();
}

fn render_all(questions: &[Question]) {
    if questions.is_empty() {
        println!("No questions found.");
    }
    for q in questions {
        render(q);
    }
}

fn read_password() -> io::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn run(cli: Cli, state: &mut ClientState<FileSessionStore>) -> Result<(), ClientError> {
    match cli.command {
        Command::List => render_all(state.refresh().await?),
        Command::Show { id } => render(&state.fetch_question(id).await?),
        Command::Search { term, remote } => {
            if remote {
                render_all(&state.remote_search(&term).await?);
            } else {
                state.refresh().await?;
                state.search(&term);
                render_all(state.visible_questions());
            }
        }
        Command::Ask {
            title,
            content,
            name,
            email,
        } => {
            let id = state
                .ask(NewQuestion {
                    title,
                    content,
                    author_name: name,
                    author_email: email,
                })
                .await?;
            println!("Question #{} posted.", id);
        }
        Command::Login { username } => {
            let password = read_password().map_err(|e| ClientError::Session(e.to_string()))?;
            let admin = state.login(&username, &password).await?;
            println!("Logged in as {}.", admin.username);
        }
        Command::Logout => {
            state.logout()?;
            println!("Logged out.");
        }
        Command::Whoami => match state.admin() {
            Some(admin) => println!("{} (id {})", admin.username, admin.id),
            None => println!("Not logged in."),
        },
        Command::Answer {
            question_id,
            content,
        } => {
            let id = state.answer(question_id, &content).await?;
            println!("Answer #{} posted.", id);
        }
        Command::EditAnswer { answer_id, content } => {
            state.edit_answer(answer_id, &content).await?;
            println!("Answer #{} updated.", answer_id);
        }
        Command::DeleteAnswer { answer_id } => {
            state.delete_answer(answer_id).await?;
            println!("Answer #{} deleted.", answer_id);
        }
        Command::DeleteQuestion { question_id } => {
            state.delete_question(question_id).await?;
            println!("Question #{} deleted.", question_id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_cli_logging("error");
    let cli = Cli::parse();

    let api = ApiClient::new(cli.api_url.clone());
    let sessions = FileSessionStore::new(cli.session.clone());
    let mut state = match ClientState::new(api, sessions) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = run(cli, &mut state).await;

    if state.take_login_required() {
        eprintln!("Your session has expired. Run `qa login --username <name>` to log in again.");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            for f in e.field_errors() {
                eprintln!("  {}: {}", f.field, f.message);
            }
            ExitCode::FAILURE
        }
    }
}
