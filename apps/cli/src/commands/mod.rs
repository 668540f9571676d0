mod add_kit;
mod categorise;
mod update_plasmids;
mod validate;

use anyhow::Result;
use splice_catalog::Layout;

use crate::cli::Command;

pub fn dispatch(command: Command, layout: &Layout) -> Result<()> {
    match command {
        Command::AddKit(args) => add_kit::run(args, layout),
        Command::UpdatePlasmids(args) => update_plasmids::run(args, layout),
        Command::Categorise => categorise::run(layout),
        Command::Validate => validate::run(layout),
    }
}
