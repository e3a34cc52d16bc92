use volt_core::{AppViewModel, DownloadState, Speaker, QUICK_ACCESS_SITES};

pub(crate) fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let download_button = match (view.download_state, view.download_enabled) {
        (DownloadState::Downloading, _) => "[baixando...]",
        (_, true) => "[baixar]",
        (_, false) => "[ - ]",
    };
    let chat_button = if view.chat_visible { "[AI *]" } else { "[AI]" };
    lines.push(format!(
        "[<] [>] [R]  {}  {} {}",
        address_display(view),
        download_button,
        chat_button
    ));

    if view.show_home {
        lines.push("VoltBrowser: velocidade máxima".to_string());
        lines.push(format!("Acesso rápido: {}", QUICK_ACCESS_SITES.join(" | ")));
    } else {
        lines.push(format!("Página: {}", view.location));
    }

    if view.download_prompt_visible {
        lines.push("Vídeo detectado! 'download' para baixar, 'dismiss' para ignorar.".to_string());
    }
    if view.download_state == DownloadState::Downloading {
        lines.push("Baixando vídeo...".to_string());
    }

    if view.chat_visible {
        lines.push("--- Volt AI ---".to_string());
        for message in &view.messages {
            lines.push(format!("{}: {}", message.speaker.label(), message.text));
        }
        if view.typing {
            lines.push(format!("{} está digitando...", Speaker::Assistant.label()));
        }
    }

    lines
}

fn address_display(view: &AppViewModel) -> String {
    if view.address_text.is_empty() {
        "(pesquise ou digite um endereço)".to_string()
    } else {
        view.address_text.clone()
    }
}

pub(crate) fn quick_sites() -> Vec<String> {
    QUICK_ACCESS_SITES
        .iter()
        .map(|site| format!("  open {}", site))
        .collect()
}
