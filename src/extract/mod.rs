// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Field extraction from captured response bodies

pub mod salt;

pub use salt::{extract, extract_with_method, ExtractionMethod, SaltRecord, SALT_FIELD};
