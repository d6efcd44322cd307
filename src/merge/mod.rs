//! Merge module - Structural merge of a desired document onto a live one.
//!
//! The desired document wins wherever it says something; anything the live
//! document holds that the desired one does not mention is left alone.

mod structural;


pub use structural::*;
