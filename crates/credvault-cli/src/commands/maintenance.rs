use crate::app::{resolve_config_path, AppContext};

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let gate = ctx.open_gate()?;
    match gate.check_integrity() {
        Ok(()) => {
            if !ctx.quiet() {
                println!("Integrity check: OK");
                println!("- config: {}", resolve_config_path()?.display());
                println!("- vault: {}", ctx.db_path()?.display());
                println!("- foreign keys: OK");
                println!("- key material: OK");
                println!("- metadata keys: OK");
            }
        }
        Err(err) => {
            eprintln!("Integrity check: FAILED");
            eprintln!("- error: {}", err);
            eprintln!("Hint: Restore the vault database from a backup before retrying.");
            return Err(anyhow::anyhow!("Integrity check failed"));
        }
    }
    Ok(())
}
