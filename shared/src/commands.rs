//! Slash-command shortcuts offered by the chat client.
//!
//! A message consisting only of a known prefix such as `/ferias` is expanded
//! into the canonical question it stands for before answering.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandSuggestion {
    pub prefix: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const COMMAND_SUGGESTIONS: &[CommandSuggestion] = &[
    CommandSuggestion {
        prefix: "/arte",
        label: "Como criar a tarefa de alteração de arte?",
        description: "Processo para solicitar alterações em materiais visuais",
    },
    CommandSuggestion {
        prefix: "/email",
        label: "Quantos dias o e-mail marketing leva para ser produzido?",
        description: "Prazos e etapas da produção de campanhas de email",
    },
    CommandSuggestion {
        prefix: "/ga4",
        label: "Como solicitar acesso ao GA4?",
        description: "Processo para obter permissões no Google Analytics",
    },
    CommandSuggestion {
        prefix: "/ti",
        label: "Como abrir chamado no suporte de TI?",
        description: "Procedimentos para solicitar suporte técnico",
    },
    CommandSuggestion {
        prefix: "/ferias",
        label: "Como solicitar férias?",
        description: "Processo para requisitar período de descanso",
    },
    CommandSuggestion {
        prefix: "/vpn",
        label: "Como configurar acesso VPN?",
        description: "Instruções para trabalho remoto via VPN",
    },
];

pub fn find_command(prefix: &str) -> Option<&'static CommandSuggestion> {
    let prefix = prefix.trim();
    COMMAND_SUGGESTIONS
        .iter()
        .find(|c| c.prefix.eq_ignore_ascii_case(prefix))
}

/// Replace a bare command prefix with its question; other messages are returned as-is.
pub fn expand_command(message: &str) -> &str {
    match find_command(message) {
        Some(cmd) => cmd.label,
        None => message,
    }
}
