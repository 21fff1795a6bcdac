use crate::ir::Category;

/// Number of leading characters the prefix rules look at.
const PREFIX_LEN: usize = 3;

/// Prefixes that always open (or continue) a warning block.
const WARNING_PREFIXES: &[&str] = &["War", "#er", "In"];
/// Lines after a `Compiling` line that are still part of normal progress output.
const LINK_PREFIXES: &[&str] = &["Arc", "Lin", "Ind"];
/// Status lines PlatformIO prints between diagnostic blocks.
const STANDARD_PREFIXES: &[&str] = &["Com", "Ver", " [E", "Rem", "Bui", "Ind", "PLA"];

const COMPILE_PREFIX: &str = "Com";

/// Carry-over state threaded through successive [`classify`] calls.
///
/// PlatformIO prints multi-line diagnostics without any terminating marker, so
/// block boundaries are reconstructed from what the previous lines looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifierState {
    /// Last category that a rule explicitly assigned.
    pub category: Category,
    /// A warning or error block is still being printed.
    pub warning_continue: bool,
    /// The previous line started with `Com` (a "Compiling ..." status line).
    pub prev_line_was_compile_marker: bool,
    /// Inside an `In file included from` / `.pio/...` continuation sub-block.
    pub warning_from_active: bool,
    /// Forces the next line to be a warning. No rule ever sets it; it is only read.
    pub next_line_warning: bool,
}

impl ClassifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `line` and advances this state in place.
    pub fn advance(&mut self, line: &str) -> Category {
        let (category, next) = classify(line, *self);
        *self = next;
        category
    }

    fn clear_continuation(&mut self) {
        self.warning_continue = false;
        self.prev_line_was_compile_marker = false;
        self.warning_from_active = false;
    }
}

/// First three characters of `line`, or the whole line when shorter.
fn line_prefix(line: &str) -> &str {
    match line.char_indices().nth(PREFIX_LEN) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

fn prefix_has(prefix: &str, items: &[&str]) -> bool {
    items.iter().any(|item| prefix.contains(item))
}

/// Assigns a severity to one line of build output.
///
/// Rules are tried in priority order and the first match decides whether the
/// category is reassigned or carried over from `state`. The function is total:
/// every input yields a category.
pub fn classify(line: &str, state: ClassifierState) -> (Category, ClassifierState) {
    let prefix = line_prefix(line);
    let mut next = state;

    if line.contains(": warning: ") {
        next.category = Category::Warning;
        next.warning_from_active = false;
        next.prev_line_was_compile_marker = false;
        next.warning_continue = true;
    } else if line.contains("Thank you") || line.contains("SUMMARY") {
        // build finished banner
        next.category = Category::Standard;
        next.clear_continuation();
    } else if prefix_has(prefix, WARNING_PREFIXES)
        || (prefix != COMPILE_PREFIX
            && state.prev_line_was_compile_marker
            && !prefix_has(prefix, LINK_PREFIXES))
        || state.next_line_warning
    {
        next.category = Category::Warning;
        next.warning_from_active = false;
        next.prev_line_was_compile_marker = false;
    } else if prefix_has(prefix, STANDARD_PREFIXES) {
        next.category = Category::Standard;
        next.warning_from_active = false;
        next.prev_line_was_compile_marker = false;
        next.warning_continue = false;
    } else if prefix == "***" {
        next.category = Category::Error;
        next.warning_from_active = false;
        next.prev_line_was_compile_marker = false;
    } else if line.contains(": error:") || line.contains(": fatal error:") {
        next.category = Category::Error;
        next.warning_from_active = false;
        next.prev_line_was_compile_marker = false;
        next.warning_continue = true;
    } else if (prefix == "fro" && state.category == Category::Warning) || prefix == ".pi" {
        // Continuation line: the category stays whatever the block already is.
        next.warning_from_active = true;
        next.prev_line_was_compile_marker = false;
        next.warning_continue = true;
    } else if state.warning_continue {
        next.category = Category::Warning;
        next.warning_from_active = false;
        next.prev_line_was_compile_marker = false;
    } else {
        next.category = Category::Standard;
        next.clear_continuation();
    }

    if prefix == COMPILE_PREFIX {
        next.prev_line_was_compile_marker = true;
    }

    (next.category, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_prefix_shorter_than_three() {
        assert_eq!(line_prefix(""), "");
        assert_eq!(line_prefix("In"), "In");
        assert_eq!(line_prefix("Compiling"), "Com");
    }

    #[test]
    fn test_line_prefix_multibyte() {
        assert_eq!(line_prefix("äöü rest"), "äöü");
    }

    #[test]
    fn test_two_char_prefix_matches_anywhere_in_prefix() {
        assert!(prefix_has("Inc", WARNING_PREFIXES));
        assert!(prefix_has(" In", WARNING_PREFIXES));
        assert!(!prefix_has("Arc", WARNING_PREFIXES));
    }
}
