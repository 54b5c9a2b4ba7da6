mod ui;

use color_eyre::eyre::{eyre, Result};
use mood_journal::{
    config::Config,
    journal_entry::{EntryPatch, NewEntry},
    journal_store::{JournalStore, StoreError},
    logging,
    quotes::QuoteRotator,
    storage::FileStorage,
};
use tracing::{error, info};
use ui::{Action, UI};

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load().map_err(|e| eyre!("Failed to load config: {}", e))?;
    logging::init(&config).map_err(|e| eyre!("Failed to set up logging: {}", e))?;
    info!(data_dir = %config.data_dir.display(), "starting mood journal");

    let storage = FileStorage::new(&config.data_dir);
    let mut store = JournalStore::load(Box::new(storage), config.persist_policy());
    let mut ui = UI::new(
        config.trend_window,
        config.averaging,
        QuoteRotator::new(config.quote_interval()),
    )?;

    loop {
        ui.display(&store)?;

        if let Some(action) = ui.handle_input(&store)? {
            let outcome = match action {
                Action::Write => match ui.get_new_entry()? {
                    Some(draft) => store
                        .add(NewEntry::new(draft.content, draft.mood, draft.emotions))
                        .map(|_| ()),
                    None => Ok(()),
                },
                Action::View => {
                    ui.view_entries(&store)?;
                    Ok(())
                }
                Action::Edit => match ui.select_entry_to_edit(&store)? {
                    Some(entry) => match ui.edit_entry(&entry)? {
                        Some(draft) => store
                            .update(
                                &entry.id,
                                EntryPatch::rewrite(draft.content, draft.mood, draft.emotions),
                            )
                            .map(|_| ()),
                        None => Ok(()),
                    },
                    None => Ok(()),
                },
                Action::Delete => match ui.select_entry_to_delete(&store)? {
                    Some(entry) => store.delete(&entry.id).map(|_| ()),
                    None => Ok(()),
                },
                Action::Search => {
                    if let Some(query) = ui.get_search_query()? {
                        let results = store.search(&query);
                        ui.display_search_results(&results)?;
                    }
                    Ok(())
                }
                Action::CycleWindow => {
                    ui.cycle_window();
                    Ok(())
                }
                Action::NextQuote => {
                    ui.next_quote();
                    Ok(())
                }
                Action::Quit => break,
            };

            if let Err(e) = outcome {
                error!(error = %e, "journal operation failed");
                ui.set_status(status_message(&e));
            }
        }
    }

    drop(ui);
    if store.is_dirty() {
        store.sync()?;
    }
    info!("mood journal closed");
    Ok(())
}

fn status_message(err: &StoreError) -> String {
    match err {
        StoreError::NotFound(_) => "That entry no longer exists.".to_string(),
        StoreError::Persist(e) => format!("Saved in memory only, will retry on next change: {e}"),
        StoreError::Serialize(e) => format!("Could not save journal: {e}"),
    }
}
