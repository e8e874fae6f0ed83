//! Building the plugin output string.
//!
//! Nagios reads the first line of the plugin output as the service output, everything up to the
//! next `|` as long output and the rest as performance data:
//!
//! ```text
//! OK - shortoutput |
//! longoutput line1
//! longoutput line2 |
//! 'perfdata'=value[UOM];[warn];[crit];[min];[max]
//! ```
//!
//! Nagios only accepts 4KB of output. Keeping inside that bound is up to the caller, the only
//! truncation done here is the optional long output line limit.

use std::collections::HashMap;

/// Values for the `{name}` placeholders of the rendered output.
pub type Substitutions = HashMap<String, String>;

const SEPARATOR: &str = " | \n";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("no substitution for placeholder '{0}'")]
    MissingPlaceholder(String),
    #[error("single '{{' encountered in format string")]
    UnclosedBrace,
    #[error("single '}}' encountered in format string")]
    UnmatchedClosingBrace,
    #[error("unsupported format spec in placeholder '{0}'")]
    UnsupportedSpec(String),
}

/// Assembles short output, long output and performance data into the final plugin output.
///
/// `long_output_limit` restricts how many long output lines are shown; when it hides lines a
/// trailer line tells how many were left out. The assembled string then goes through
/// [substitute].
pub fn render(
    short_output: &str,
    long_output: &[String],
    perf_data: &[String],
    long_output_limit: Option<usize>,
    substitutions: &Substitutions,
) -> Result<String, FormatError> {
    let mut out = short_output.to_owned();

    if !long_output.is_empty() {
        trim_trailing_newlines(&mut out);
        let shown = long_output_limit.map_or(long_output.len(), |l| l.min(long_output.len()));
        out.push_str(SEPARATOR);
        out.push_str(&long_output[..shown].join("\n"));

        if let Some(limit) = long_output_limit {
            if limit < long_output.len() {
                out.push_str(&format!(
                    "\n(...showing only first {} lines, {} elements remaining...)",
                    limit,
                    long_output.len() - limit
                ));
            }
        }
    }

    if !perf_data.is_empty() {
        trim_trailing_newlines(&mut out);
        out.push_str(SEPARATOR);
        out.push_str(&perf_data.join(" "));
    }

    substitute(&out, substitutions)
}

/// Collapses all whitespace, line breaks included, into single spaces. Used for messages that
/// have to fit on the status line.
pub(crate) fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_trailing_newlines(s: &mut String) {
    let len = s.trim_end_matches('\n').len();
    s.truncate(len);
}

/// Replaces every `{name}` in `template` by its value from `substitutions`.
///
/// `{{` and `}}` stand for literal braces. Only plain names are supported, a placeholder with a
/// conversion or format spec is an error.
pub fn substitute(template: &str, substitutions: &Substitutions) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(FormatError::UnclosedBrace),
                        Some(c) => name.push(c),
                    }
                }

                if name.contains(|c: char| c == ':' || c == '!') {
                    return Err(FormatError::UnsupportedSpec(name));
                }

                match substitutions.get(&name) {
                    Some(value) => out.push_str(value),
                    None => return Err(FormatError::MissingPlaceholder(name)),
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(FormatError::UnmatchedClosingBrace),
            c => out.push(c),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_short_output_only() {
        let subs = Substitutions::new();
        assert_eq!(render("service up", &[], &[], None, &subs).unwrap(), "service up");
        assert_eq!(render("", &[], &[], Some(3), &subs).unwrap(), "");
        assert_eq!(render("up\n", &[], &[], None, &subs).unwrap(), "up\n");
    }

    #[test]
    fn test_render_long_output() {
        let out = render(
            "service up\n\n",
            &lines(&["line1", "line2"]),
            &[],
            None,
            &Substitutions::new(),
        )
        .unwrap();

        assert_eq!(out, "service up | \nline1\nline2");
        assert_eq!(out.matches(" | ").count(), 1);
        assert!(out.ends_with("line1\nline2"));
    }

    #[test]
    fn test_render_full_scenario() {
        let out = render(
            "service up",
            &lines(&["line1", "line2", "line3"]),
            &lines(&["'latency'=12ms;100;200;0;500"]),
            Some(2),
            &Substitutions::new(),
        )
        .unwrap();

        assert_eq!(
            out,
            "service up | \nline1\nline2\n(...showing only first 2 lines, 1 elements remaining...) | \n'latency'=12ms;100;200;0;500"
        );
    }

    #[test]
    fn test_render_limit() {
        let long = lines(&["a", "b", "c", "d"]);
        let subs = Substitutions::new();

        for limit in 0..long.len() {
            let out = render("s", &long, &[], Some(limit), &subs).unwrap();
            let trailer = format!(
                "(...showing only first {} lines, {} elements remaining...)",
                limit,
                long.len() - limit
            );
            assert!(out.ends_with(&trailer), "{}", out);

            let body = out.trim_start_matches("s | \n");
            let shown: Vec<&str> = body.lines().filter(|l| !l.is_empty()).collect();
            assert_eq!(shown.len(), limit + 1);
        }

        assert_eq!(
            render("s", &long, &[], Some(0), &subs).unwrap(),
            "s | \n\n(...showing only first 0 lines, 4 elements remaining...)"
        );

        // no trailer once everything fits
        assert_eq!(
            render("s", &long, &[], Some(4), &subs).unwrap(),
            "s | \na\nb\nc\nd"
        );
        assert_eq!(
            render("s", &long, &[], Some(10), &subs).unwrap(),
            "s | \na\nb\nc\nd"
        );
    }

    #[test]
    fn test_render_perf_data_only() {
        let out = render(
            "up\n",
            &[],
            &lines(&["'a'=1", "'b'=2s;3;4"]),
            None,
            &Substitutions::new(),
        )
        .unwrap();
        assert_eq!(out, "up | \n'a'=1 'b'=2s;3;4");
    }

    #[test]
    fn test_render_is_repeatable() {
        let long = lines(&["x", "y"]);
        let perf = lines(&["'p'=1"]);
        let subs = Substitutions::new();

        let first = render("s", &long, &perf, Some(1), &subs).unwrap();
        let second = render("s", &long, &perf, Some(1), &subs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_substitutions() {
        let mut subs = Substitutions::new();
        subs.insert("host".to_owned(), "ftp.example.org".to_owned());
        subs.insert("n".to_owned(), "3".to_owned());

        let out = render(
            "{host} answered",
            &lines(&["{n} files"]),
            &lines(&["'files'={n}"]),
            None,
            &subs,
        )
        .unwrap();
        assert_eq!(out, "ftp.example.org answered | \n3 files | \n'files'=3");

        assert_eq!(
            render("{missing}", &[], &[], None, &subs),
            Err(FormatError::MissingPlaceholder("missing".to_owned()))
        );
    }

    #[test]
    fn test_single_line() {
        assert_eq!(
            single_line("Expected code [230], got response: 530 Login incorrect\r\n\n"),
            "Expected code [230], got response: 530 Login incorrect"
        );
        assert_eq!(single_line("a\n  b\tc"), "a b c");
        assert_eq!(single_line(""), "");
    }

    #[test]
    fn test_substitute() {
        let mut subs = Substitutions::new();
        subs.insert("a".to_owned(), "{b}".to_owned());

        assert_eq!(substitute("{a}", &subs).unwrap(), "{b}");
        assert_eq!(substitute("{{a}} {a}", &subs).unwrap(), "{a} {b}");
        assert_eq!(substitute("no braces", &subs).unwrap(), "no braces");

        assert_eq!(substitute("{a", &subs), Err(FormatError::UnclosedBrace));
        assert_eq!(substitute("a}", &subs), Err(FormatError::UnmatchedClosingBrace));
        assert_eq!(
            substitute("{}", &subs),
            Err(FormatError::MissingPlaceholder(String::new()))
        );
        assert_eq!(
            substitute("{a:>4}", &subs),
            Err(FormatError::UnsupportedSpec("a:>4".to_owned()))
        );
    }
}
