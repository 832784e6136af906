//! Service-level ("prazo") classification of an order.
//!
//! Two threshold ladders apply depending on whether the order has been
//! handed to a carrier yet. Every comparison is a strict `>`, so a value
//! exactly on a threshold lands in the lower bucket.

use serde::Serialize;

/// Urgency bucket summarizing how overdue an order is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Delivered,
    Normal,
    Medium,
    High,
    Critical,
}

impl UrgencyLevel {
    /// Sort priority, most urgent first.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Normal => 3,
            Self::Delivered => 4,
        }
    }
}

/// Delivery-timeliness state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrazoStatus {
    /// Terminal.
    Delivered,
    /// No tracking yet, past the grace window.
    AguardandoUrgente,
    /// No tracking yet.
    Aguardando,
    /// Tracked, far beyond the expected delivery window.
    Critico,
    /// Tracked, past the expected delivery window.
    Atrasado,
    /// Tracked, approaching the end of the window.
    Alerta,
    /// Tracked, within the window.
    NoPrazo,
}

impl PrazoStatus {
    /// Short human label (pt-BR), as shown to the operations team.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivered => "Entregue",
            Self::AguardandoUrgente => "Aguardando rastreio (urgente)",
            Self::Aguardando => "Aguardando rastreio",
            Self::Critico => "Crítico",
            Self::Atrasado => "Atrasado",
            Self::Alerta => "Alerta",
            Self::NoPrazo => "No prazo",
        }
    }
}

/// Result of running an order through the ladders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Urgency {
    pub prazo_status: PrazoStatus,
    pub urgency_level: UrgencyLevel,
}

/// Days without tracking after which the order needs attention.
pub const UNTRACKED_MEDIUM_AFTER: u32 = 3;
/// Days without tracking after which the order is critical.
pub const UNTRACKED_CRITICAL_AFTER: u32 = 7;
pub const TRACKED_ALERT_AFTER: u32 = 12;
pub const TRACKED_LATE_AFTER: u32 = 15;
pub const TRACKED_CRITICAL_AFTER: u32 = 20;

/// Classify an order from its age, tracking presence and delivery state.
///
/// Delivery short-circuits to the terminal state regardless of age.
#[must_use]
pub const fn classify(days_since_order: u32, has_tracking: bool, is_delivered: bool) -> Urgency {
    let (prazo_status, urgency_level) = if is_delivered {
        (PrazoStatus::Delivered, UrgencyLevel::Delivered)
    } else if has_tracking {
        if days_since_order > TRACKED_CRITICAL_AFTER {
            (PrazoStatus::Critico, UrgencyLevel::Critical)
        } else if days_since_order > TRACKED_LATE_AFTER {
            (PrazoStatus::Atrasado, UrgencyLevel::High)
        } else if days_since_order > TRACKED_ALERT_AFTER {
            (PrazoStatus::Alerta, UrgencyLevel::Medium)
        } else {
            (PrazoStatus::NoPrazo, UrgencyLevel::Normal)
        }
    } else if days_since_order > UNTRACKED_CRITICAL_AFTER {
        (PrazoStatus::AguardandoUrgente, UrgencyLevel::Critical)
    } else if days_since_order > UNTRACKED_MEDIUM_AFTER {
        (PrazoStatus::Aguardando, UrgencyLevel::Medium)
    } else {
        (PrazoStatus::Aguardando, UrgencyLevel::Normal)
    };

    Urgency {
        prazo_status,
        urgency_level,
    }
}

/// Whether an order is late.
///
/// Uses its own break points (15 days tracked, 7 untracked) rather than the
/// ladder above.
#[must_use]
pub const fn is_late(days_since_order: u32, has_tracking: bool) -> bool {
    let limit = if has_tracking {
        TRACKED_LATE_AFTER
    } else {
        UNTRACKED_CRITICAL_AFTER
    };
    days_since_order > limit
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn level(days: u32, tracked: bool) -> (PrazoStatus, UrgencyLevel) {
        let u = classify(days, tracked, false);
        (u.prazo_status, u.urgency_level)
    }

    #[test]
    fn test_delivered_is_terminal_at_any_age() {
        for days in [0, 5, 21, 400] {
            for tracked in [true, false] {
                let u = classify(days, tracked, true);
                assert_eq!(u.prazo_status, PrazoStatus::Delivered);
                assert_eq!(u.urgency_level, UrgencyLevel::Delivered);
            }
        }
    }

    #[test]
    fn test_tracked_ladder_boundaries() {
        assert_eq!(level(12, true), (PrazoStatus::NoPrazo, UrgencyLevel::Normal));
        assert_eq!(level(13, true), (PrazoStatus::Alerta, UrgencyLevel::Medium));
        assert_eq!(level(15, true), (PrazoStatus::Alerta, UrgencyLevel::Medium));
        assert_eq!(level(16, true), (PrazoStatus::Atrasado, UrgencyLevel::High));
        assert_eq!(level(20, true), (PrazoStatus::Atrasado, UrgencyLevel::High));
        assert_eq!(level(21, true), (PrazoStatus::Critico, UrgencyLevel::Critical));
    }

    #[test]
    fn test_untracked_ladder_boundaries() {
        assert_eq!(level(0, false), (PrazoStatus::Aguardando, UrgencyLevel::Normal));
        assert_eq!(level(3, false), (PrazoStatus::Aguardando, UrgencyLevel::Normal));
        assert_eq!(level(4, false), (PrazoStatus::Aguardando, UrgencyLevel::Medium));
        assert_eq!(level(7, false), (PrazoStatus::Aguardando, UrgencyLevel::Medium));
        assert_eq!(
            level(8, false),
            (PrazoStatus::AguardandoUrgente, UrgencyLevel::Critical)
        );
    }

    #[test]
    fn test_is_late_uses_independent_break_points() {
        assert!(!is_late(15, true));
        assert!(is_late(16, true));
        assert!(!is_late(7, false));
        assert!(is_late(8, false));
        // Tracked at 14 days is "alerta" yet not late.
        assert_eq!(level(14, true).0, PrazoStatus::Alerta);
        assert!(!is_late(14, true));
    }

    #[test]
    fn test_priority_orders_most_urgent_first() {
        let mut levels = vec![
            UrgencyLevel::Normal,
            UrgencyLevel::Critical,
            UrgencyLevel::Medium,
            UrgencyLevel::High,
        ];
        levels.sort_by_key(|l| l.priority());
        assert_eq!(
            levels,
            vec![
                UrgencyLevel::Critical,
                UrgencyLevel::High,
                UrgencyLevel::Medium,
                UrgencyLevel::Normal
            ]
        );
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_value(PrazoStatus::AguardandoUrgente).unwrap(),
            "aguardando_urgente"
        );
        assert_eq!(serde_json::to_value(PrazoStatus::NoPrazo).unwrap(), "no_prazo");
        assert_eq!(serde_json::to_value(UrgencyLevel::High).unwrap(), "high");
    }
}
