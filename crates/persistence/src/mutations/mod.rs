// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `elections`: election find-or-create and deletion
//! - `entities`: contest and ballot response registration
//! - `updates`: committing, deleting and ingesting snapshot versions
//!
//! Every public function here runs in its own transaction. Nested calls run
//! as savepoints of the caller's transaction.

pub mod elections;
pub mod entities;
pub mod updates;
