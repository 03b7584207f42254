//! Terminal transcript shown on each monitor.

use chrono::{DateTime, Local, TimeZone};

use crate::models::{AgentId, AgentStatus};

/// Lines for `agent` in `status`, stamped with the current local time.
pub fn terminal_lines(status: AgentStatus, agent: AgentId) -> Vec<String> {
    terminal_lines_at(status, agent, &Local::now())
}

/// Lines for `agent` in `status`, stamped with `now`.
pub fn terminal_lines_at<Tz>(status: AgentStatus, agent: AgentId, now: &DateTime<Tz>) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format("%H:%M:%S").to_string();
    let prefix = format!("[{}]", agent.as_str().to_uppercase());
    let name = agent.as_str();

    match status {
        AgentStatus::Working => vec![
            format!("{stamp} {prefix} Analisando..."),
            format!("{stamp} {prefix} Processando dados..."),
            format!("> {name} execute --verbose"),
            "  \u{2713} Inicializado".to_string(),
            "  \u{23F3} Executando...".to_string(),
            "  \u{25CB} Aguardando...".to_string(),
        ],
        AgentStatus::Thinking => vec![
            format!("{stamp} {prefix} Analisando opções..."),
            format!("? {name} ponderar estratégia"),
            "  \u{2192} Avaliando abordagem A...".to_string(),
            "  \u{2192} Avaliando abordagem B...".to_string(),
            "  ...".to_string(),
        ],
        AgentStatus::Completed => vec![
            format!("{stamp} {prefix} Tarefa concluída!"),
            format!("> {name} finalize"),
            "  \u{2713} Verificação completa".to_string(),
            "  \u{2713} Artefatos gerados".to_string(),
            "  \u{2713} Sucesso!".to_string(),
        ],
        AgentStatus::Error => vec![
            format!("{stamp} {prefix} ERRO detectado!"),
            format!("> {name} debug"),
            "  \u{2717} Falha na linha 42".to_string(),
            "  ! Verificando logs...".to_string(),
            "  ? Tentar novamente?".to_string(),
        ],
        AgentStatus::Idle => vec![
            format!("{stamp} {prefix} Pronto"),
            "> _".to_string(),
            "  Aguardando instruções...".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 34, 56).unwrap()
    }

    #[test]
    fn test_working_transcript() {
        let lines = terminal_lines_at(AgentStatus::Working, AgentId::Coder, &at_noon());
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "12:34:56 [CODER] Analisando...");
        assert_eq!(lines[2], "> coder execute --verbose");
    }

    #[test]
    fn test_every_status_starts_with_stamped_prefix() {
        for status in AgentStatus::ALL {
            let lines = terminal_lines_at(status, AgentId::Maestro, &at_noon());
            assert!(lines[0].starts_with("12:34:56 [MAESTRO] "), "{}", status);
        }
    }

    #[test]
    fn test_idle_transcript() {
        let lines = terminal_lines_at(AgentStatus::Idle, AgentId::Verifier, &at_noon());
        assert_eq!(
            lines,
            vec![
                "12:34:56 [VERIFIER] Pronto".to_string(),
                "> _".to_string(),
                "  Aguardando instruções...".to_string(),
            ]
        );
    }
}
