//! Evolutionary weekly class timetabling.
//!
//! Searches for a weekly timetable that places every required lesson of
//! every subject at a (day, slot) with a teacher and a room, avoiding double
//! bookings and honouring soft preferences: teacher availability, balanced
//! daily load, no gaps, and few working days per teacher.
//!
//! - **Catalog**: subjects, teachers, rooms, cohorts and availability, with
//!   one-pass validation into hard errors and recoverable warnings.
//! - **Demand**: required lessons expanded into atomic units grouped into
//!   same-day blocks.
//! - **Genome**: a candidate timetable as a flat assignment list or as a
//!   5 × 4 day/slot grid with exact-count repair.
//! - **Scoring**: pluggable policies, a minimized penalty model and a
//!   maximized reward model, plus normalised quality metrics.
//! - **GA**: a generic direction-aware genetic algorithm with tournament
//!   selection, elitism, stagnation and time-limit stops, cancellation and a
//!   per-generation observer.
//! - **Timetable**: the GA problem tying the above together and the
//!   [`schedule`](timetable::schedule) entry point.
//!
//! # Architecture
//!
//! The optimizer consumes an in-memory [`Catalog`](catalog::Catalog) and
//! returns the best genome with its fitness history. Loading catalogs from
//! files and rendering or exporting timetables belong to the caller.

pub mod catalog;
pub mod demand;
pub mod ga;
pub mod genome;
pub mod scoring;
pub mod timetable;
