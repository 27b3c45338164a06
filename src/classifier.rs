//! Pattern-based content classification for untrusted strings.
//!
//! Two fixed rule sets decide whether a string *looks like* a SQL-injection
//! payload or a script-injection (XSS) payload. Matching is case-insensitive
//! and succeeds when any rule hits anywhere in the string.
//!
//! This is a heuristic, not a parser. It is deliberately conservative: words
//! such as `update` or `select` are flagged wherever they appear.

use once_cell::sync::Lazy;
use regex::Regex;

static SQL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(select|insert|update|delete|drop|create|alter|exec|execute|union|script|javascript|--|;|/\*|\*/|xp_|sp_)",
    )
    .expect("valid sql pattern")
});

static SCRIPT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(<script|<iframe|<object|<embed|<applet|javascript:|onerror|onload|eval\(|expression\()")
        .expect("valid script pattern")
});

/// Verdict of the content classifier for a single string.
///
/// The two flags are computed independently; a string can trip both.
///
/// # Examples
///
/// ```
/// use task_guard::classify;
///
/// let verdict = classify(Some("<script>drop()</script>"));
/// assert!(verdict.sql_injection);
/// assert!(verdict.script_injection);
///
/// assert!(classify(Some("hello world")).is_clean());
/// assert!(classify(None).is_clean());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    /// The string matched the SQL rule set.
    pub sql_injection: bool,
    /// The string matched the script rule set.
    pub script_injection: bool,
}

impl Classification {
    /// Returns `true` when neither rule set matched.
    pub fn is_clean(&self) -> bool {
        !self.sql_injection && !self.script_injection
    }
}

/// Classifies a possibly-absent string against both rule sets.
pub fn classify(input: Option<&str>) -> Classification {
    Classification {
        sql_injection: contains_sql_injection(input),
        script_injection: contains_script_injection(input),
    }
}

/// Returns `true` if the input contains any SQL rule anywhere.
///
/// Absent and empty input never match.
pub fn contains_sql_injection(input: Option<&str>) -> bool {
    input.is_some_and(|s| SQL_PATTERN.is_match(s))
}

/// Returns `true` if the input contains any script rule anywhere.
///
/// Absent and empty input never match.
pub fn contains_script_injection(input: Option<&str>) -> bool {
    input.is_some_and(|s| SCRIPT_PATTERN.is_match(s))
}
