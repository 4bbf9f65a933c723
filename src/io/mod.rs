//! Objects used to read preference files and to write models and seatings.

mod lp_writer;
pub use lp_writer::LpWriter;

mod preferences_reader;
pub use preferences_reader::PreferencesReader;

mod seating_writer;
pub use seating_writer::SeatingWriter;

mod wcnf_writer;
pub use wcnf_writer::WcnfFormat;
pub use wcnf_writer::WcnfWriter;
