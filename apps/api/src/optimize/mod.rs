// Optimize API: request validation, initial state construction, and the
// POST /optimize handler that runs the workflow to completion.

pub mod handlers;
