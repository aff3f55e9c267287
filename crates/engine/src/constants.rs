// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

/// How long a single validation unit (one shape and one focus node)
/// may take, before it is abandoned.
pub const DEFAULT_TIMEOUT_MS_PER_UNIT: u64 = 5000;

/// How deep shapes may be nested into each other
/// (through logical combinators, `sh:node` and qualified value shapes).
pub const DEFAULT_MAX_DEPTH: usize = 50;
