use anyhow::{Context, Result};
use std::path::PathBuf;
use std::rc::Rc;
use unistate::Store;

mod logger;
mod reducers;
mod script;

use script::DemoScript;

fn main() -> Result<()> {
    logger::init();

    log::info!("Starting unistate-demo");

    let script_path = std::env::args_os().nth(1).map(PathBuf::from);
    let script = DemoScript::load(script_path.as_deref())?;

    let mut builder = Store::builder(reducers::root_reducer()?)
        .options(script.store.clone())
        .setup(|view| {
            let listener_view = view.clone();
            view.subscribe(Rc::new(move || {
                if let Some(state) = listener_view.get_state() {
                    log::info!("State: {}", state);
                }
            }));
        });
    if let Some(state) = script.preloaded_state.clone() {
        builder = builder.preloaded_state(state);
    }
    let store = builder.build().context("Failed to create store")?;

    for scripted in &script.actions {
        store
            .dispatch(scripted.to_action())
            .with_context(|| format!("Failed to dispatch {}", scripted.kind))?;
    }

    println!("{}", serde_json::to_string_pretty(&store.get_state())?);

    log::info!("Exiting unistate-demo");
    Ok(())
}
