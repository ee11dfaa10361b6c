use belge_core::error::BelgeError;
use belge_core::master::store::MasterStore;

use super::resolve_config;
use crate::output;
use crate::{OutputFormat, StoreArgs};

pub fn run(store_args: &StoreArgs, output_format: OutputFormat) -> Result<(), BelgeError> {
    let config = resolve_config(store_args)?;
    let loaded = MasterStore::from_config(&config).load()?;

    match output_format {
        OutputFormat::Json => output::json::print(&loaded.list)?,
        OutputFormat::Table => {
            let records: Vec<_> = loaded.list.iter().map(|(_, e)| e.record.clone()).collect();
            output::table::print_records(&records);
            eprintln!("{} document(s)", records.len());
        }
    }
    Ok(())
}
