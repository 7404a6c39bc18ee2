//! Order Status State Machine
//!
//! 状态链: pending → confirmed → preparing → ready → completed
//! `cancelled` 按策略从 pending (默认) 或任意非终态进入。
//! completed / cancelled 为终态，不可再变更。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// 终态：completed / cancelled
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// 状态链上的位置，用于禁止回退
    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Confirmed => 1,
            OrderStatus::Preparing => 2,
            OrderStatus::Ready => 3,
            OrderStatus::Completed => 4,
            // cancelled 不在推进链上
            OrderStatus::Cancelled => u8::MAX,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 取消策略
///
/// 默认只允许取消待处理订单 (保护已下厨的单)。
/// `AnyActive` 为宽松变体，通过 `CANCEL_POLICY=any-active` 启用。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CancelPolicy {
    #[default]
    PendingOnly,
    AnyActive,
}

impl FromStr for CancelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending-only" => Ok(CancelPolicy::PendingOnly),
            "any-active" => Ok(CancelPolicy::AnyActive),
            other => Err(format!("Unknown cancel policy: {}", other)),
        }
    }
}

/// 非法状态迁移
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Order is already {0}, no further transitions allowed")]
    Terminal(OrderStatus),

    #[error("Cannot move order backwards from {from} to {to}")]
    Backward { from: OrderStatus, to: OrderStatus },

    #[error("Only pending orders can be cancelled (current status: {0})")]
    CancelNotAllowed(OrderStatus),
}

/// 校验一次状态迁移是否合法
///
/// 推进链上只许前进 (允许跳级，柜台快单可以直接 pending → completed)；
/// 终态不可再变；取消按策略限制。同状态迁移视为无操作，放行。
pub fn check_transition(
    current: OrderStatus,
    target: OrderStatus,
    policy: CancelPolicy,
) -> Result<(), TransitionError> {
    if current == target {
        return Ok(());
    }

    if current.is_terminal() {
        return Err(TransitionError::Terminal(current));
    }

    if target == OrderStatus::Cancelled {
        return match policy {
            CancelPolicy::AnyActive => Ok(()),
            CancelPolicy::PendingOnly if current == OrderStatus::Pending => Ok(()),
            CancelPolicy::PendingOnly => Err(TransitionError::CancelNotAllowed(current)),
        };
    }

    if target.rank() < current.rank() {
        return Err(TransitionError::Backward {
            from: current,
            to: target,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn forward_chain_is_legal() {
        for (from, to) in [
            (Pending, Confirmed),
            (Confirmed, Preparing),
            (Preparing, Ready),
            (Ready, Completed),
        ] {
            assert!(check_transition(from, to, CancelPolicy::PendingOnly).is_ok());
        }
    }

    #[test]
    fn skipping_ahead_is_legal() {
        assert!(check_transition(Pending, Completed, CancelPolicy::PendingOnly).is_ok());
        assert!(check_transition(Confirmed, Ready, CancelPolicy::PendingOnly).is_ok());
    }

    #[test]
    fn backward_moves_are_rejected() {
        let err = check_transition(Ready, Preparing, CancelPolicy::PendingOnly).unwrap_err();
        assert_eq!(
            err,
            TransitionError::Backward {
                from: Ready,
                to: Preparing
            }
        );
        assert!(check_transition(Confirmed, Pending, CancelPolicy::PendingOnly).is_err());
    }

    #[test]
    fn terminal_states_are_frozen() {
        for terminal in [Completed, Cancelled] {
            for target in [Pending, Confirmed, Preparing, Ready, Completed, Cancelled] {
                if terminal == target {
                    continue;
                }
                assert_eq!(
                    check_transition(terminal, target, CancelPolicy::AnyActive),
                    Err(TransitionError::Terminal(terminal))
                );
            }
        }
    }

    #[test]
    fn cancel_pending_only_by_default() {
        assert!(check_transition(Pending, Cancelled, CancelPolicy::PendingOnly).is_ok());
        for from in [Confirmed, Preparing, Ready] {
            assert_eq!(
                check_transition(from, Cancelled, CancelPolicy::PendingOnly),
                Err(TransitionError::CancelNotAllowed(from))
            );
        }
    }

    #[test]
    fn any_active_policy_allows_late_cancel() {
        for from in [Pending, Confirmed, Preparing, Ready] {
            assert!(check_transition(from, Cancelled, CancelPolicy::AnyActive).is_ok());
        }
        // 终态仍然不可取消
        assert!(check_transition(Completed, Cancelled, CancelPolicy::AnyActive).is_err());
    }

    #[test]
    fn same_status_is_a_noop() {
        assert!(check_transition(Preparing, Preparing, CancelPolicy::PendingOnly).is_ok());
    }

    #[test]
    fn policy_parses_from_config_string() {
        assert_eq!(
            "pending-only".parse::<CancelPolicy>().unwrap(),
            CancelPolicy::PendingOnly
        );
        assert_eq!(
            "any-active".parse::<CancelPolicy>().unwrap(),
            CancelPolicy::AnyActive
        );
        assert!("whenever".parse::<CancelPolicy>().is_err());
    }
}
