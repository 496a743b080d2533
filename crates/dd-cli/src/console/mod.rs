//! Terminal front end.
//!
//! `driver` runs the interactive session loop; `render` turns views into text.

mod driver;
pub mod render;

use std::io::Write;

use dd_app::ListUsers;

pub use driver::Console;

/// Fetch the user listing and print it as a table.
pub async fn print_user_directory<W: Write>(
    list_users: &ListUsers,
    out: &mut W,
) -> anyhow::Result<()> {
    let directory = list_users.execute().await?;
    out.write_all(render::render_directory(&directory).as_bytes())?;
    out.flush()?;
    Ok(())
}
