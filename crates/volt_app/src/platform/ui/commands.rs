use thiserror::Error;
use volt_core::{Msg, QUICK_ACCESS_SITES};

pub(crate) const HELP_TEXT: &str = "\
Comandos:
  go <texto>     digita e envia na barra de endereço
  type <texto>   edita a barra de endereço sem enviar
  enter          envia a barra de endereço
  focus | blur   foca ou desfoca a barra de endereço
  open <site>    abre um atalho de acesso rápido
  sites          lista os atalhos
  back | forward | refresh
  download       baixa o vídeo detectado
  dismiss        ignora o aviso de vídeo
  chat           abre ou fecha o Volt AI
  say <texto>    envia uma mensagem ao Volt AI
  show           redesenha a tela
  help | quit";

/// One line of terminal input, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Messages to feed the shell, in order.
    Dispatch(Vec<Msg>),
    /// Send to the assistant, opening the panel first if it is closed.
    Say(String),
    Sites,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("comando desconhecido: {0} (digite 'help')")]
    Unknown(String),
    #[error("'{0}' precisa de um texto")]
    MissingArgument(&'static str),
    #[error("atalho desconhecido: {0} (digite 'sites')")]
    UnknownSite(String),
}

pub(crate) fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let dispatch = |msgs: Vec<Msg>| Ok(Command::Dispatch(msgs));
    match verb.to_lowercase().as_str() {
        "" => dispatch(Vec::new()),
        "go" => {
            let text = required("go", rest)?;
            dispatch(vec![
                Msg::AddressInputChanged(text.to_string()),
                Msg::AddressSubmitted,
            ])
        }
        "type" => dispatch(vec![Msg::AddressInputChanged(rest.to_string())]),
        "enter" => dispatch(vec![Msg::AddressSubmitted]),
        "focus" => dispatch(vec![Msg::AddressFocused]),
        "blur" => dispatch(vec![Msg::AddressBlurred]),
        "open" => {
            let name = required("open", rest)?;
            let site = QUICK_ACCESS_SITES
                .iter()
                .find(|site| site.eq_ignore_ascii_case(name))
                .ok_or_else(|| CommandError::UnknownSite(name.to_string()))?;
            dispatch(vec![Msg::ShortcutClicked(site.to_string())])
        }
        "back" => dispatch(vec![Msg::BackClicked]),
        "forward" => dispatch(vec![Msg::ForwardClicked]),
        "refresh" | "reload" => dispatch(vec![Msg::RefreshClicked]),
        "download" => dispatch(vec![Msg::DownloadClicked]),
        "dismiss" => dispatch(vec![Msg::DownloadPromptDismissed]),
        "chat" => dispatch(vec![Msg::ChatToggled]),
        "say" => Ok(Command::Say(required("say", rest)?.to_string())),
        "sites" => Ok(Command::Sites),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn required<'a>(verb: &'static str, rest: &'a str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(verb))
    } else {
        Ok(rest)
    }
}
