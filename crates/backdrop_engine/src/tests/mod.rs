//! End-to-end tests driving the whole backdrop against the recording backend

mod scenarios;
