//! Raw token classification.
//!
//! The scanner only looks at token shape; resolving aliases and consuming
//! values is the dispatcher's job (see `Cli::parse`).

/// Shape of a single argv token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// The literal `--` end-of-options marker.
    Separator,
    /// `--name` or `--name=value`; `name` excludes the dashes.
    Long {
        name: &'a str,
        inline: Option<&'a str>,
    },
    /// `-abc`: one or more short-option characters after a single dash.
    Cluster(&'a str),
    /// Anything else, including a bare `-`.
    Free,
}

pub(crate) fn classify(arg: &str) -> Token<'_> {
    if arg == "--" {
        return Token::Separator;
    }
    if let Some(body) = arg.strip_prefix("--") {
        return match body.split_once('=') {
            Some((name, value)) => Token::Long {
                name,
                inline: Some(value),
            },
            None => Token::Long { name: body, inline: None },
        };
    }
    if arg.len() > 1 && arg.starts_with('-') {
        return Token::Cluster(&arg[1..]);
    }
    Token::Free
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_separator() {
        assert_eq!(classify("--"), Token::Separator);
    }

    #[test]
    fn classifies_long_options() {
        assert_eq!(
            classify("--verbose"),
            Token::Long { name: "verbose", inline: None }
        );
        assert_eq!(
            classify("--name=value"),
            Token::Long { name: "name", inline: Some("value") }
        );
        // Only the first '=' splits.
        assert_eq!(
            classify("--name=a=b"),
            Token::Long { name: "name", inline: Some("a=b") }
        );
        assert_eq!(
            classify("--name="),
            Token::Long { name: "name", inline: Some("") }
        );
    }

    #[test]
    fn classifies_short_clusters() {
        assert_eq!(classify("-v"), Token::Cluster("v"));
        assert_eq!(classify("-abc"), Token::Cluster("abc"));
        assert_eq!(classify("-ofile.txt"), Token::Cluster("ofile.txt"));
    }

    #[test]
    fn classifies_free_tokens() {
        assert_eq!(classify("file.txt"), Token::Free);
        assert_eq!(classify("-"), Token::Free);
        assert_eq!(classify(""), Token::Free);
    }
}
