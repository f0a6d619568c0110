//! The API endpoints URIs.

/// The route for the current month's headline figures.
pub const SUMMARY: &str = "/api/dashboard/summary";
/// The route for the per-category expense breakdown.
pub const EXPENSES_BY_CATEGORY: &str = "/api/dashboard/expenses-by-category";
/// The route for the month-by-month trend series.
pub const MONTHLY_EVOLUTION: &str = "/api/dashboard/monthly-evolution";
/// The route for budget utilization and alerts.
pub const BUDGETS_STATUS: &str = "/api/dashboard/budgets-status";
/// The route for the combined dashboard response.
pub const AGGREGATED: &str = "/api/dashboard/aggregated";
/// The route for calendar events within a date range.
pub const CALENDAR: &str = "/api/transactions/calendar";
/// The route for the liveness check.
pub const HEALTH: &str = "/api/health";
