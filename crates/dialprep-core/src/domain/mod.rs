pub mod cell;
pub mod phone;
pub mod table;

pub use cell::CellValue;
pub use phone::{clean_digits, AreaCode, ValidatedPhone};
pub use table::{RawRecord, RawTable};
