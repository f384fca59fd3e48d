//! Application services - Use case implementations
//!
//! Each service is a stateless handle; encounter state lives in the
//! `EncounterAggregate` the caller passes in by reference.

pub mod aoe_service;
pub mod combat_log_service;
pub mod encounter_service;
pub mod healing_service;
pub mod turn_order_service;

// Re-export AoE service types
pub use aoe_service::{AoeError, AoeOutcome, AoeService, ComponentResolution, TargetResolution};

// Re-export combat log builders and formatting
pub use combat_log_service::{
    create_aoe_result, create_damage_result, create_healing_result, format_combat_log_message,
    group_combat_results_by_transaction, new_healing_transaction_id,
};

pub use encounter_service::EncounterService;
pub use healing_service::HealingService;

// Re-export turn order types
pub use turn_order_service::{
    base_group_name, format_turn_order_entry, GroupBadge, HealthDisplay, StandardHealthDisplay,
    TurnOrderDisplay, TurnOrderEntry, TurnOrderService,
};
