// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `elections`: election lookup and listing
//! - `entities`: contests and ballot responses
//! - `updates`: updates, vote tallies and standings
//! - `counts`: row counts per election

pub mod counts;
pub mod elections;
pub mod entities;
pub mod updates;
