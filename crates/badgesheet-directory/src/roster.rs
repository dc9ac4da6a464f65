use crate::{DirectoryError, Result};
use badgesheet_core::normalize_email;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a comma-delimited roster whose first line is a header.
///
/// The email column is the first cell shaped like an address in the first data
/// row that has one. Rows before it are skipped; every later row contributes
/// the cell in that same column.
pub fn read_roster<R: Read>(input: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut column: Option<usize> = None;
    let mut emails = Vec::new();
    let mut rows = 0usize;
    for record in reader.records() {
        let record = record.map_err(|err| DirectoryError::Roster(err.to_string()))?;
        rows += 1;
        let index = match column {
            Some(index) => index,
            None => match record.iter().position(looks_like_email) {
                Some(index) => {
                    column = Some(index);
                    index
                }
                None => continue,
            },
        };

        if let Some(cell) = record.get(index).map(str::trim) {
            if !cell.is_empty() {
                emails.push(cell.to_string());
            }
        }
    }
    if column.is_none() && rows > 0 {
        return Err(DirectoryError::Roster(format!(
            "no email column in {rows} data row(s)"
        )));
    }
    Ok(emails)
}

pub fn read_roster_file(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    read_roster(file).map_err(|err| match err {
        DirectoryError::Roster(message) => {
            DirectoryError::Roster(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}

/// Appends `extra` to `roster`, dropping case-insensitive duplicates and keeping
/// the first occurrence of each address.
pub fn merge_must_include(roster: Vec<String>, extra: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    roster
        .into_iter()
        .chain(extra.iter().cloned())
        .filter_map(|email| {
            let key = normalize_email(&email)?;
            seen.insert(key).then(|| email.trim().to_string())
        })
        .collect()
}

fn looks_like_email(cell: &str) -> bool {
    let cell = cell.trim();
    if cell.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = cell.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::{looks_like_email, merge_must_include, read_roster};

    #[test]
    fn detects_email_in_any_column() {
        let first = "Email,Name\nada@example.com,Ada\ngrace@example.com,Grace\n";
        let middle = "Name,Email,Team\nAda,ada@example.com,A\nGrace,grace@example.com,B\n";
        let last = "Name,Team,Email\nAda,A,ada@example.com\nGrace,B, grace@example.com \n";
        for input in [first, middle, last] {
            let emails = read_roster(input.as_bytes()).expect("roster");
            assert_eq!(emails, vec!["ada@example.com", "grace@example.com"]);
        }
    }

    #[test]
    fn reads_single_column_text() {
        let input = "emails\ndosinski@fearless.tech\ntmccullough@fearsol.com\n\nmpollich@email.com\n";
        let emails = read_roster(input.as_bytes()).expect("roster");
        assert_eq!(
            emails,
            vec![
                "dosinski@fearless.tech",
                "tmccullough@fearsol.com",
                "mpollich@email.com"
            ]
        );
    }

    #[test]
    fn header_only_is_empty() {
        let emails = read_roster("Name,Email\n".as_bytes()).expect("roster");
        assert!(emails.is_empty());
    }

    #[test]
    fn rejects_roster_without_emails() {
        let err = read_roster("Name,Team\nAda,A\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no email column"));
    }

    #[test]
    fn column_is_found_past_rows_without_email() {
        let input = "Name,Email\nVisitor,\nGuest, n/a \nAda,ada@example.com\nGrace,grace@example.com\n";
        let emails = read_roster(input.as_bytes()).expect("roster");
        assert_eq!(emails, vec!["ada@example.com", "grace@example.com"]);
    }

    #[test]
    fn short_rows_are_skipped() {
        let input = "Name,Email\nAda,ada@example.com\nGrace\n";
        let emails = read_roster(input.as_bytes()).expect("roster");
        assert_eq!(emails, vec!["ada@example.com"]);
    }

    #[test]
    fn merge_keeps_order_and_drops_duplicates() {
        let roster = vec!["ada@example.com".to_string(), "grace@example.com".to_string()];
        let extra = vec![
            "Ada@Example.com".to_string(),
            " linus@example.com ".to_string(),
        ];
        assert_eq!(
            merge_must_include(roster, &extra),
            vec!["ada@example.com", "grace@example.com", "linus@example.com"]
        );
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("dosinski@fearless.tech"));
        assert!(!looks_like_email("Dominick Osinski"));
        assert!(!looks_like_email("user@localhost"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("a b@example.com"));
    }
}
