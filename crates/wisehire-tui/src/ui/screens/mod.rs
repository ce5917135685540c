//! Per-route content rendering.

pub mod candidate_detail;
pub mod dashboard;
pub mod tables;

use ratatui::{
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use wisehire_core::EntityList;

use crate::ui::styles;

/// An entity that renders as one table row.
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    fn widths() -> Vec<Constraint>;

    fn cells(&self) -> Vec<String>;

    /// Inactive rows are drawn muted.
    fn is_active(&self) -> bool {
        true
    }
}

/// Everything besides the rows that a list screen shows.
pub struct TableView<'a> {
    pub title: String,
    pub hint: &'a str,
    pub selection: usize,
    pub loading: bool,
}

/// Render a paged entity list with a selection highlight.
pub fn render_table<T: TableRow>(frame: &mut Frame, area: Rect, list: &EntityList<T>, view: TableView) {
    let paging = if list.has_next() || list.has_previous() {
        format!(" - page {}", list.page())
    } else {
        String::new()
    };
    let title = format!(" {} ({}){} - {} ", view.title, list.total(), paging, view.hint);

    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if list.is_empty() {
        let message = if view.loading || list.fetched_at().is_none() {
            "Loading..."
        } else {
            "No records found"
        };
        let paragraph = Paragraph::new(Line::styled(format!(" {}", message), styles::muted_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(T::COLUMNS.iter().map(|c| Cell::from(*c)))
        .style(styles::header_style())
        .height(1);

    let rows: Vec<Row> = list
        .items()
        .iter()
        .map(|item| Row::new(item.cells()).style(styles::active_style(item.is_active())))
        .collect();

    let table = Table::new(rows, T::widths())
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(view.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

/// "Yes"/"No" column text.
pub fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;
    use wisehire_core::models::{CustomerCompany, Page};

    fn draw(list: &EntityList<CustomerCompany>, loading: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        terminal
            .draw(|frame| {
                let view = TableView {
                    title: "Customer Companies".to_string(),
                    hint: "[t] toggle",
                    selection: 0,
                    loading,
                };
                render_table(frame, frame.area(), list, view);
            })
            .unwrap();
        terminal.backend().buffer().content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_empty_list_shows_placeholder() {
        let list = EntityList::new();
        assert!(draw(&list, true).contains("Loading..."));

        let mut fetched = EntityList::new();
        fetched.replace(1, Page::default());
        assert!(draw(&fetched, false).contains("No records found"));
    }

    #[test]
    fn test_rows_and_total_render() {
        let page: Page<CustomerCompany> = serde_json::from_value(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{"id": 3, "name": "Globex", "code": "GX", "is_active": false}]
        }))
        .unwrap();
        let mut list = EntityList::new();
        list.replace(1, page);

        let screen = draw(&list, false);
        assert!(screen.contains("Customer Companies (1)"));
        assert!(screen.contains("Globex"));
    }
}
