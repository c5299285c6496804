// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture pipeline tying dispatch, extraction, storage and notification together

mod pipeline;

pub use pipeline::{CapturePipeline, CaptureReport};
