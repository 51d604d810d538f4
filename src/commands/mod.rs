/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `authorize`: interactive OAuth 1.0a PIN authorization
*/

pub mod authorize;
