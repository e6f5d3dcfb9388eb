#[cfg(test)]
mod tests {
    use slate::{next_statement_name, rewrite_positional_placeholders, truncate_long};
    use std::thread;

    #[test]
    fn rewrite() {
        assert_eq!(
            rewrite_positional_placeholders("SELECT * FROM t WHERE a = $# AND b = $#"),
            "SELECT * FROM t WHERE a = $1 AND b = $2"
        );
        assert_eq!(rewrite_positional_placeholders("SELECT 1"), "SELECT 1");
        assert_eq!(rewrite_positional_placeholders(""), "");
        assert_eq!(rewrite_positional_placeholders("$#$#"), "$1$2");
        // Already numbered placeholders are left alone
        assert_eq!(
            rewrite_positional_placeholders("VALUES ($1, $#)"),
            "VALUES ($1, $1)"
        );
        let sql = format!("VALUES ({})", vec!["$#"; 12].join(", "));
        assert!(rewrite_positional_placeholders(&sql).ends_with("$11, $12)"));
        // Textual rewrite, literals included
        assert_eq!(
            rewrite_positional_placeholders("SELECT '$#', $#"),
            "SELECT '$1', $2"
        );
    }

    #[test]
    fn statement_names() {
        let names = (0..100).map(|_| next_statement_name()).collect::<Vec<_>>();
        let indexes = names
            .iter()
            .map(|v| {
                v.strip_prefix("statement")
                    .expect("Name must start with `statement`")
                    .parse::<u64>()
                    .expect("Name must end with a number")
            })
            .collect::<Vec<_>>();
        assert!(indexes[0] >= 1);
        assert!(indexes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn statement_names_across_threads() {
        let handles = (0..4)
            .map(|_| {
                thread::spawn(|| (0..50).map(|_| next_statement_name()).collect::<Vec<_>>())
            })
            .collect::<Vec<_>>();
        let mut names = handles
            .into_iter()
            .flat_map(|h| h.join().expect("Thread panicked"))
            .collect::<Vec<_>>();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 200);
    }

    #[test]
    fn truncate() {
        assert_eq!(truncate_long!("SELECT 1").to_string(), "SELECT 1\n");
        let long = format!("SELECT '{}'", "é".repeat(400));
        let truncated = truncate_long!(long).to_string();
        assert!(truncated.ends_with("...\n"));
        assert!(truncated.len() <= 497 + 4);
    }
}
