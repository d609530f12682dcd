pub mod alphabet;
pub mod loader;
pub mod sais;
pub mod table;

pub use alphabet::{normalize, Alphabet, Symbol};
pub use loader::{read_text, TextFormat};
pub use sais::sais_table;
pub use table::SuffixTable;
