// Adapters layer: HTTP gateways implementing the domain ports.

pub mod google_trends;
pub mod supabase;

pub use google_trends::GoogleTrendsClient;
pub use supabase::SupabaseStore;
