use gateway_tools::paystack::Bank;
use prettytable::{
    format::{LinePosition, LineSeparator, TableFormat},
    row,
    Table,
};

fn markdown_format() -> TableFormat {
    prettytable::format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
        .padding(1, 1)
        .build()
}

pub fn format_banks(banks: &[Bank]) -> String {
    if banks.is_empty() {
        return "No banks found".to_string();
    }
    let mut table = Table::new();
    table.set_format(markdown_format());
    table.set_titles(row!["Code", "Name", "Slug", "Active"]);
    banks.iter().for_each(|bank| {
        table.add_row(row![
            bank.code,
            bank.name,
            bank.slug.as_deref().unwrap_or_default(),
            if bank.active { "yes" } else { "no" }
        ]);
    });
    table.to_string()
}
