use maud::{html, Markup, Render};
use xferview_host::{Cell, InMemoryDom, TableRow};

pub struct HtmlTable<'a> {
    id: &'a str,
    rows: Vec<TableRow>,
}

impl<'a> HtmlTable<'a> {
    pub fn new(id: &'a str, rows: Vec<TableRow>) -> Self {
        Self { id, rows }
    }
}

impl Render for HtmlTable<'_> {
    fn render(&self) -> Markup {
        html! {
            table id=(self.id) {
                tbody {
                    @for row in &self.rows {
                        tr {
                            @for cell in &row.cells {
                                td { (HtmlCell(cell)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

struct HtmlCell<'a>(&'a Cell);

impl Render for HtmlCell<'_> {
    fn render(&self) -> Markup {
        match self.0 {
            Cell::Checkbox { value, checked } => html! {
                input type="checkbox" value=(value) checked[*checked];
            },
            Cell::Text(text) => html! { (text) },
            Cell::Control {
                control,
                label,
                data_id,
            } => html! {
                a href="#" class=(control) data-id=(data_id) { (label) }
            },
        }
    }
}

pub fn render_html(dom: &InMemoryDom, table_ids: &[&str]) -> String {
    html! {
        @for table_id in table_ids {
            (HtmlTable::new(table_id, dom.rows(table_id)))
        }
    }
    .into_string()
}

pub fn render_text(dom: &InMemoryDom, table_ids: &[&str]) -> String {
    table_ids
        .iter()
        .map(|table_id| {
            let rows = dom.rows(table_id);
            let header = format!("# {table_id} ({} rows)\n", rows.len());
            rows.iter().fold(header, |mut out, row| {
                out.push_str(&row_text(row));
                out.push('\n');
                out
            })
        })
        .collect()
}

fn row_text(row: &TableRow) -> String {
    row.cells
        .iter()
        .map(|cell| match cell {
            Cell::Checkbox { value, checked } => {
                format!("[{}] {value}", if *checked { "x" } else { " " })
            }
            Cell::Text(text) => text.clone(),
            Cell::Control { label, data_id, .. } => format!("{label} #{data_id}"),
        })
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use maud::Render;
    use xferview_host::{Cell, DomRenderer, InMemoryDom, TableRow};

    use super::{render_html, render_text, HtmlTable};

    fn dom() -> InMemoryDom {
        let dom = InMemoryDom::with_tables(["download-table", "history-table"]);
        dom.append_row(
            "download-table",
            TableRow::new(vec![
                Cell::Checkbox {
                    value: "7".to_string(),
                    checked: false,
                },
                Cell::Text("a<b>.csv".to_string()),
                Cell::Text("2.0 kB".to_string()),
            ]),
        )
        .expect("row");
        dom.append_row(
            "history-table",
            TableRow::new(vec![
                Cell::Text("a.bam".to_string()),
                Cell::Control {
                    control: "view".to_string(),
                    label: "View".to_string(),
                    data_id: "11".to_string(),
                },
            ]),
        )
        .expect("row");
        dom
    }

    #[test]
    fn html_escapes_cell_text() {
        let html = render_html(&dom(), &["download-table", "history-table"]);
        assert!(html.contains("<td>a&lt;b&gt;.csv</td>"));
        assert!(html.contains("<input type=\"checkbox\" value=\"7\">"));
        assert!(html.contains("<a href=\"#\" class=\"view\" data-id=\"11\">View</a>"));
        assert!(!html.contains("a<b>"));
    }

    #[test]
    fn html_escapes_attribute_values() {
        let rows = vec![TableRow::new(vec![
            Cell::Checkbox {
                value: "\"><script>".to_string(),
                checked: true,
            },
            Cell::Control {
                control: "view".to_string(),
                label: "Tom & Jerry".to_string(),
                data_id: "1\"2".to_string(),
            },
        ])];
        let html = HtmlTable::new("t<1>", rows).render().into_string();

        assert!(html.starts_with("<table id=\"t&lt;1&gt;\"><tbody><tr>"));
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\" checked>"));
        assert!(html.contains("data-id=\"1&quot;2\">Tom &amp; Jerry</a>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn text_lists_rows_per_table() {
        let text = render_text(&dom(), &["download-table", "history-table"]);
        assert!(text.contains("# download-table (1 rows)\n[ ] 7\ta<b>.csv\t2.0 kB\n"));
        assert!(text.contains("a.bam\tView #11"));
    }
}
