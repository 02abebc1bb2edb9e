mod lines;
mod orders;

pub(crate) use lines::{OrderLine, PgOrderLinesRepository};
pub(crate) use orders::{NewOrderRow, PgOrdersRepository};
