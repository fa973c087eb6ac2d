pub mod due;
pub mod ticket;
pub mod title;

pub use due::{
    DueDateError, DueUrgency, due_short_label, due_urgency, format_due_date, parse_due_date,
    parse_due_date_at,
};
pub use ticket::{TicketError, is_valid_ticket, normalize_ticket};
pub use title::{ParsedTitle, parse_title, parse_title_at};
