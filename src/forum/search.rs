//! Case-insensitive substring search over questions.
//!
//! Shared by the client-side snapshot search and the in-memory store's
//! `?q=` filter so both paths agree on what matches.

use super::models::Question;

/// Lowercased search needle. `None` for a blank term.
///
/// Surrounding whitespace only decides blankness; it stays part of the
/// needle, so `"foo "` does not match a trailing `"foo"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn parse(term: &str) -> Option<Self> {
        if term.trim().is_empty() {
            None
        } else {
            Some(Self(term.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Title, content, author name, or any answer's content.
    pub fn matches(&self, q: &Question) -> bool {
        let hit = |text: &str| text.to_lowercase().contains(&self.0);
        hit(&q.title)
            || hit(&q.content)
            || hit(&q.author_name)
            || q.answers.iter().any(|a| hit(&a.content))
    }

    pub fn filter<'a, I>(&self, questions: I) -> Vec<Question>
    where
        I: IntoIterator<Item = &'a Question>,
    {
        questions
            .into_iter()
            .filter(|q| self.matches(q))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forum::models::Answer;
    use chrono::Utc;

    fn question(id: i64, title: &str, answers: &[&str]) -> Question {
        let now = Utc::now();
        Question {
            id,
            title: title.to_string(),
            content: "I keep getting error Y when running Z".to_string(),
            author_name: "Alice".to_string(),
            author_email: None,
            created_at: now,
            updated_at: now,
            answers: answers
                .iter()
                .enumerate()
                .map(|(i, c)| Answer {
                    id: i as i64 + 1,
                    question_id: id,
                    content: c.to_string(),
                    admin_id: 1,
                    admin_username: "admin".to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
        }
    }

    #[test]
    fn test_blank_term_is_none() {
        assert_eq!(SearchTerm::parse(""), None);
        assert_eq!(SearchTerm::parse("   "), None);
    }

    #[test]
    fn test_case_insensitive_title_match() {
        let term = SearchTerm::parse("CONFIGURE").unwrap();
        assert!(term.matches(&question(1, "How do I configure X?", &[])));
    }

    #[test]
    fn test_author_match() {
        let term = SearchTerm::parse("alice").unwrap();
        assert!(term.matches(&question(1, "Anything here", &[])));
    }

    #[test]
    fn test_answer_only_match_returns_question() {
        let qs = vec![
            question(1, "How do I configure X?", &["Try upgrading to version 2"]),
            question(2, "Unrelated title", &["Reboot it"]),
        ];
        let term = SearchTerm::parse("upgrading").unwrap();
        let hits = term.filter(&qs);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_whitespace_is_part_of_the_needle() {
        let q = question(1, "How do I configure X?", &[]);
        assert!(SearchTerm::parse("configure ").unwrap().matches(&q));
        assert!(!SearchTerm::parse(" How").unwrap().matches(&q));
        assert_eq!(SearchTerm::parse(" Foo ").unwrap().as_str(), " foo ");
    }

    #[test]
    fn test_no_match() {
        let term = SearchTerm::parse("kubernetes").unwrap();
        assert!(term.filter(&[question(1, "How do I configure X?", &[])]).is_empty());
    }
}
