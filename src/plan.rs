//! Plan gating: which tools and limits a user's subscription allows.
//!
//! The session coordinator and the tool entry points consult this before
//! permitting an operation; a denial is expected control flow (the UI
//! shows an upgrade prompt), not an error path.

use serde::{Deserialize, Serialize};

use crate::tools::ToolId;

pub const FREE_PROJECT_LIMIT: u32 = 3;
pub const FREE_MONTHLY_EXPORT_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    Free,
    Pro,
}

#[derive(Debug, Clone, Copy)]
pub struct PlanAccess {
    plan: Plan,
}

impl PlanAccess {
    pub fn new(plan: Plan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }

    pub fn is_pro(&self) -> bool {
        self.plan == Plan::Pro
    }

    pub fn has_access(&self, tool: ToolId) -> bool {
        !tool.pro_only() || self.is_pro()
    }

    pub fn restricted_tools(&self) -> Vec<ToolId> {
        ToolId::ALL
            .iter()
            .copied()
            .filter(|t| !self.has_access(*t))
            .collect()
    }

    pub fn can_create_project(&self, current_count: u32) -> bool {
        self.is_pro() || current_count < FREE_PROJECT_LIMIT
    }

    pub fn can_export(&self, exports_this_month: u32) -> bool {
        self.is_pro() || exports_this_month < FREE_MONTHLY_EXPORT_LIMIT
    }
}
