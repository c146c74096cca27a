// CSV tables on stdout. Values are joined with commas as-is; none of the
// catalog fields contain commas.

use std::io::{self, Write};

use qsearch_common::fields::{self, FieldMap};

/// Write one table: an optional header, then a line per row in `selection`
/// order. Returns the number of rows written.
pub fn write_table<W, I>(
    out: &mut W,
    selection: &[&str],
    header: bool,
    rows: I,
) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = FieldMap>,
{
    if header {
        writeln!(out, "{}", selection.join(","))?;
    }
    let mut written = 0;
    for row in rows {
        writeln!(out, "{}", fields::select(&row, selection).join(","))?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(id: &str, mag: &str) -> FieldMap {
        HashMap::from([("EventID", id.to_string()), ("Magnitude", mag.to_string())])
    }

    #[test]
    fn selection_order_and_header() {
        let mut out = Vec::new();
        let n = write_table(
            &mut out,
            &["Magnitude", "EventID"],
            true,
            vec![row("2014p1", "3.1"), row("2014p2", "4")],
        )
        .unwrap();

        assert_eq!(n, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Magnitude,EventID\n3.1,2014p1\n4,2014p2\n"
        );
    }

    #[test]
    fn no_header_no_rows() {
        let mut out = Vec::new();
        write_table(&mut out, &["EventID"], false, Vec::new()).unwrap();
        assert!(out.is_empty());
    }
}
