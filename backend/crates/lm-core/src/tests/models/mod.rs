mod leave_request;
mod role;
