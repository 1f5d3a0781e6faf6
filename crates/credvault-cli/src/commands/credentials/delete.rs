use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::helpers::parse_record_id;

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let id = parse_record_id(args.id)?;
    let gate = ctx.open_gate()?;
    let session = gate.authorize(&ctx.authenticator())?;
    session.delete_credential(id)?;

    if !ctx.quiet() {
        println!("Deleted credential {}", id);
    }
    Ok(())
}
