use crate::Result;
use crate::view::{EXPORT_COLUMNS, ExportRow};
use std::io::Write;

/// Write export rows as tab-separated text with a header line.
///
/// Tabs and line breaks inside cells are replaced by spaces.
pub fn write_export_tsv(rows: &[ExportRow], mut out: impl Write) -> Result<()> {
    writeln!(out, "{}", EXPORT_COLUMNS.join("\t"))?;
    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| clean(c)).collect();
        writeln!(out, "{}", cells.join("\t"))?;
    }
    out.flush()?;
    Ok(())
}

pub fn render_export_tsv(rows: &[ExportRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_export_tsv(rows, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn clean(cell: &str) -> String {
    cell.replace(['\t', '\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_header_and_escaped_rows() {
        let rows = vec![ExportRow {
            task_id: "T1".into(),
            source_id: "CRM".into(),
            source_name: "Sales\tforce".into(),
            product_id: "1042".into(),
            product_name: "Customer\n360".into(),
            category: "extract".into(),
            status: Status::InProgress,
        }];
        let text = render_export_tsv(&rows).unwrap();
        assert_eq!(
            text,
            "task_id\tsource_id\tsource_name\tproduct_id\tproduct_name\tcategory\tstatus\n\
             T1\tCRM\tSales force\t1042\tCustomer 360\textract\tin_progress\n"
        );
    }
}
