use crate::{
    cli::globals::GlobalArgs,
    config::AppConfig,
    graphql::queries::{self, UserSummary},
};
use anyhow::{Context, Result};
use std::fmt::Write;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
}

const HEADERS: [&str; 5] = ["ID", "First Name", "Last Name", "Email", "Role"];

/// Fetch all users and print them as a table.
/// # Errors
/// Returns an error if the query fails.
pub async fn execute(args: Args) -> Result<()> {
    let globals = GlobalArgs::new(args.config);

    let users = queries::users(&globals.graphql.get_client())
        .await
        .context("Error loading users")?;

    if users.is_empty() {
        println!("No users found.");
    } else {
        print!("{}", render_table(&users));
    }

    Ok(())
}

fn row(user: &UserSummary) -> [&str; 5] {
    [
        user.id.as_str(),
        user.first_name.as_deref().unwrap_or(""),
        user.last_name.as_deref().unwrap_or(""),
        user.email.as_str(),
        user.role.as_str(),
    ]
}

fn render_table(users: &[UserSummary]) -> String {
    let rows: Vec<[&str; 5]> = users.iter().map(row).collect();

    // `{:<width$}` pads by chars, not bytes
    let mut widths = HEADERS.map(|header| header.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    for cells in std::iter::once(&HEADERS).chain(&rows) {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(table, "{}", line.trim_end());
    }
    table
}
