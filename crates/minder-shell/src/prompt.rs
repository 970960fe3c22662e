//! Conflict prompts.

use std::future::Future;

use minder_ops::{Conflict, ConflictAction, Disposition};

/// Asks the user how to settle a conflict.
pub trait Prompter {
    /// Return the user's answer for `conflict`.
    fn choose(&mut self, conflict: &Conflict) -> impl Future<Output = Disposition>;
}

/// The question shown for a conflict.
pub fn question(conflict: &Conflict) -> String {
    let (proceed, key) = match conflict.action {
        ConflictAction::Overwrite => ("overwrite", 'o'),
        ConflictAction::Delete => ("delete", 'd'),
    };
    format!(
        "{conflict}\n[{key}] {proceed}  [s] skip  [a] {proceed} all  [n] skip all  [q] abort: "
    )
}

/// Interpret a typed answer. Returns `None` if it is not recognised.
pub fn parse_answer(action: ConflictAction, input: &str) -> Option<Disposition> {
    let answer = input.trim().to_lowercase();
    let proceed = match action {
        ConflictAction::Overwrite => ["o", "overwrite"],
        ConflictAction::Delete => ["d", "delete"],
    };

    match answer.as_str() {
        "y" | "yes" => Some(Disposition::Proceed),
        a if proceed.contains(&a) => Some(Disposition::Proceed),
        "s" | "skip" | "no" => Some(Disposition::Skip),
        "a" | "all" => Some(Disposition::ProceedAll),
        "n" | "none" | "skip all" => Some(Disposition::SkipAll),
        "q" | "quit" | "abort" => Some(Disposition::Abort),
        a if a == format!("{} all", proceed[1]) => Some(Disposition::ProceedAll),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_answers() {
        let action = ConflictAction::Overwrite;
        assert_eq!(parse_answer(action, "o"), Some(Disposition::Proceed));
        assert_eq!(parse_answer(action, " Overwrite \n"), Some(Disposition::Proceed));
        assert_eq!(parse_answer(action, "overwrite all"), Some(Disposition::ProceedAll));
        assert_eq!(parse_answer(action, "s"), Some(Disposition::Skip));
        assert_eq!(parse_answer(action, "n"), Some(Disposition::SkipAll));
        assert_eq!(parse_answer(action, "q"), Some(Disposition::Abort));
        assert_eq!(parse_answer(action, "d"), None);
        assert_eq!(parse_answer(action, ""), None);
    }

    #[test]
    fn test_delete_answers() {
        let action = ConflictAction::Delete;
        assert_eq!(parse_answer(action, "d"), Some(Disposition::Proceed));
        assert_eq!(parse_answer(action, "delete all"), Some(Disposition::ProceedAll));
        assert_eq!(parse_answer(action, "skip all"), Some(Disposition::SkipAll));
        assert_eq!(parse_answer(action, "o"), None);
    }

    #[test]
    fn test_question_names_action() {
        let q = question(&Conflict::deletion("/tmp/x", false));
        assert!(q.starts_with("delete this file? /tmp/x"));
        assert!(q.contains("[d] delete"));
    }
}
