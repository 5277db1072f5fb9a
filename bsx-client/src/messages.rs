//! User-facing status texts

// Credential flow
pub const MISSING_CREDENTIALS: &str = "Please enter username and password.";
pub const REGISTERED: &str = "Registration successful! Please login.";
pub const REGISTER_FAILED: &str = "Registration failed.";
pub const LOGGED_IN: &str = "Logged in successfully!";
pub const LOGIN_FAILED: &str = "Login failed.";
pub const LOGGED_OUT: &str = "Logged out.";

// Shared by upload and recommendation
pub const LOGIN_FIRST: &str = "Please login first.";

// Upload pipeline
pub const SELECT_FILE_FIRST: &str = "Please select a file first.";
pub const UPLOAD_FAILED: &str = "File upload failed.";

// Recommendation flow
pub const ENTER_FEATURES: &str = "Enter comma-separated numbers for features.";
pub const INVALID_FEATURES: &str = "Invalid input for features.";
pub const RECOMMENDATION_RECEIVED: &str = "Recommendation received!";
pub const RECOMMENDATION_DISCARDED: &str = "Session changed; recommendation discarded.";
pub const RECOMMENDATION_FAILED: &str = "Failed to get AI recommendation.";
