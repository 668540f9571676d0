use anyhow::{bail, Result};
use splice_catalog::builder::check_syntaxes;
use splice_catalog::Layout;

pub fn run(layout: &Layout) -> Result<()> {
    let checks = check_syntaxes(layout)?;

    let mut failed = 0;
    for check in &checks {
        match &check.result {
            Ok(parts) => println!("ok    {} ({parts} parts)", check.label),
            Err(e) => {
                failed += 1;
                println!("FAIL  {}\n      {e}", check.label);
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} syntax definitions are invalid", checks.len());
    }
    Ok(())
}
