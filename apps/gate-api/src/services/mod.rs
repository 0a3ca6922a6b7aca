//! Service layer: the orchestration between HTTP handlers and storage.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Service Layer                                    │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  EventService  │  │  OrderService  │  │  RedemptionService         ││
//! │  │                │  │                │  │                            ││
//! │  │ • create_event │  │ • create_order │  │ • redeem                   ││
//! │  │ • get_event    │  │ • get_order    │  │   (token → ticket →        ││
//! │  │                │  │   (reserve →   │  │    gate match →            ││
//! │  │                │  │    mint → link)│  │    one-way mark_used)      ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  Every operation takes an already-verified Principal and returns a     │
//! │  typed ApiResult; handlers only translate to HTTP.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod event_service;
pub mod order_service;
pub mod redemption_service;

pub use event_service::{EventService, NewEvent};
pub use order_service::{OrderDetails, OrderService};
pub use redemption_service::RedemptionService;
