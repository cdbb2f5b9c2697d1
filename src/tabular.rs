/// A parsed delimited-text table: trimmed header tokens plus the data rows
/// that matched the header width. Rows are kept in source order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Field of `row` under the named header, or "" when the column is
    /// absent. Rows always have exactly `headers.len()` fields.
    pub fn field<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        self.column(name)
            .and_then(|i| row.get(i))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}

/// Parse a published-sheet CSV export.
///
/// This reproduces the portal's historical parser byte for byte in behavior,
/// because the backing sheets were exported against it:
/// - input is trimmed, lines split on \n or \r\n; fewer than 2 lines = empty
/// - header tokens are split on bare commas and trimmed
/// - a `"` toggles the in-quotes flag and is never emitted; a `,` outside
///   quotes ends the field; fields are trimmed
/// - doubled quotes are close-then-reopen, NOT an escaped literal quote
/// - a row is dropped unless its field count equals the header count
pub fn parse_table(text: &str) -> Table {
    let trimmed = text.trim();
    let lines: Vec<&str> = trimmed
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    if lines.len() < 2 {
        return Table::default();
    }

    let headers: Vec<String> = lines[0].split(',').map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();

    for line in &lines[1..] {
        if line.is_empty() {
            continue;
        }
        let values = split_row(line);
        if values.len() == headers.len() {
            rows.push(values);
        }
    }

    Table { headers, rows }
}

fn split_row(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == ',' && !in_quotes {
            values.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    values.push(current.trim().to_string());
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_in_order() {
        let t = parse_table("Name, NISN ,Class\nAli,1001,A\nBudi,1002,B\n");
        assert_eq!(t.headers, vec!["Name", "NISN", "Class"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec!["Ali", "1001", "A"]);
        assert_eq!(t.field(&t.rows[1], "NISN"), "1002");
        assert_eq!(t.field(&t.rows[1], "Missing"), "");
    }

    #[test]
    fn quoted_field_keeps_embedded_comma() {
        let t = parse_table("Name,Score\n\"Doe, Jane\",BSH");
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.rows[0], vec!["Doe, Jane", "BSH"]);
    }

    #[test]
    fn doubled_quote_is_close_then_reopen() {
        // Historical limitation kept for sheet compatibility: "" does not
        // produce a literal quote.
        let t = parse_table("A,B\n\"say \"\"hi\"\"\",x");
        assert_eq!(t.rows[0], vec!["say hi", "x"]);
    }

    #[test]
    fn mismatched_rows_are_dropped_silently() {
        let t = parse_table("A,B,C\n1,2,3\n1,2\n1,2,3,4\n4,5,6");
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec!["1", "2", "3"]);
        assert_eq!(t.rows[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn empty_or_header_only_input_yields_no_rows() {
        assert!(parse_table("").headers.is_empty());
        assert!(parse_table("   \n  ").rows.is_empty());
        let header_only = parse_table("A,B,C");
        assert!(header_only.headers.is_empty());
        assert!(header_only.rows.is_empty());
    }

    #[test]
    fn crlf_and_blank_lines_are_handled() {
        let t = parse_table("A,B\r\n1,2\r\n\r\n3,4\r\n");
        assert_eq!(t.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn fields_are_trimmed() {
        let t = parse_table("A,B\n  1 , \" spaced \" ");
        assert_eq!(t.rows[0], vec!["1", "spaced"]);
    }
}
