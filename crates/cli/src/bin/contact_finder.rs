use anyhow::Result;

fn main() -> Result<()> {
    contact_cli::main_entry()
}
