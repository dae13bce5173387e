// Composition root for the customers bounded context.
//
// Responsibilities:
// - Read remote-access config from environment.
// - Instantiate the Shopify adapter.
// - Wire the adapter into the browse and edit handlers around one shared
//   page cache.

pub mod http;
pub mod state;
