use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use volt_core::Msg;
use volt_engine::{
    ApiKeyStore, CompletionBackend, ContentSurface, GeminiBackend, KeyFileSelector, KeySelector,
    ScriptedBackend, Shell, SimulatedSurface,
};
use volt_logging::{volt_info, volt_warn};

use super::config::{self, AppConfig};
use super::logging;
use super::ui::commands::{self, Command, HELP_TEXT};
use super::ui::render;

pub fn run_app() -> std::io::Result<()> {
    let loaded = config::load_config(Path::new(config::CONFIG_FILENAME));
    let app_config = loaded.as_ref().cloned().unwrap_or_default();
    logging::initialize(app_config.log_destination);
    if let Err(err) = &loaded {
        volt_warn!("Using default configuration: {}", err);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_terminal(app_config))
}

async fn run_terminal(app_config: AppConfig) -> std::io::Result<()> {
    let mut shell = build_shell(&app_config);
    print_lines(&render::render(&shell.view()));
    println!("Digite 'help' para ver os comandos.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match commands::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{}", HELP_TEXT),
                    Ok(Command::Sites) => print_lines(&render::quick_sites()),
                    Ok(Command::Show) => print_lines(&render::render(&shell.view())),
                    Ok(Command::Dispatch(msgs)) => {
                        for msg in msgs {
                            shell.dispatch(msg);
                        }
                    }
                    Ok(Command::Say(text)) => {
                        if !shell.view().chat_visible {
                            shell.dispatch(Msg::ChatToggled);
                        }
                        shell.dispatch(Msg::ChatInputChanged(text));
                        shell.dispatch(Msg::ChatSubmitted);
                    }
                    Err(err) => println!("{}", err),
                }
                shell.process_pending();
            }
            Some(_) = shell.process_next() => {}
        }

        for notice in shell.take_notices() {
            println!("[{}] {}", Local::now().format("%H:%M:%S"), notice);
        }
        if shell.consume_dirty() {
            print_lines(&render::render(&shell.view()));
        }
    }

    volt_info!("Terminal closed");
    Ok(())
}

fn build_shell(app_config: &AppConfig) -> Shell {
    let key_file = app_config.api_key_file.as_deref();
    let keys = ApiKeyStore::new(config::initial_api_key(key_file));
    let backend = select_backend(app_config, &keys);

    let mut builder = Shell::builder(app_config.shell_settings(), backend);
    if let Some(path) = key_file {
        let selector: Arc<dyn KeySelector> =
            Arc::new(KeyFileSelector::new(path.to_path_buf(), keys));
        builder = builder.key_selector(selector);
    }

    let policy = app_config.cross_origin_policy();
    builder.build(|sink| -> Arc<dyn ContentSurface> { Arc::new(SimulatedSurface::new(policy, sink)) })
}

/// Gemini when there is a key or a file to reselect one from, the offline echo otherwise.
fn select_backend(app_config: &AppConfig, keys: &ApiKeyStore) -> Arc<dyn CompletionBackend> {
    if keys.get().is_none() && app_config.api_key_file.is_none() {
        volt_info!("No API key configured; assistant runs offline");
        return Arc::new(ScriptedBackend::echo());
    }
    match GeminiBackend::new(app_config.gemini_settings(), keys.clone()) {
        Ok(backend) => {
            volt_info!("Assistant uses model {}", app_config.gemini_model);
            Arc::new(backend)
        }
        Err(err) => {
            volt_warn!("Could not set up Gemini backend ({}); assistant runs offline", err);
            Arc::new(ScriptedBackend::echo())
        }
    }
}

fn print_lines(lines: &[String]) {
    println!();
    for line in lines {
        println!("{}", line);
    }
}
