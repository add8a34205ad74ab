// handlers/public/root.rs - GET / handler

pub async fn root_get() -> &'static str {
    "Welcome to myFlix!"
}
