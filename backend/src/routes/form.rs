use axum::response::Html;

const FORM_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>User Registration</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 600px; margin: 50px auto; padding: 20px; }
        form { background: #f5f5f5; padding: 20px; border-radius: 8px; }
        input, textarea { width: 100%; padding: 10px; margin: 10px 0; border: 1px solid #ddd; border-radius: 4px; }
        button { background: #007bff; color: white; padding: 10px 20px; border: none; border-radius: 4px; cursor: pointer; }
        button:hover { background: #0056b3; }
    </style>
</head>
<body>
    <h1>User Registration</h1>
    <form action="/upload" method="post" enctype="multipart/form-data">
        <input type="text" name="user_id" placeholder="User ID" required>
        <input type="text" name="name" placeholder="Full Name" required>
        <textarea name="address" placeholder="Address" required></textarea>
        <input type="file" name="image" accept="image/*" required>
        <button type="submit">Submit</button>
    </form>
</body>
</html>
"#;

/// Static registration form
#[allow(clippy::unused_async)]
pub async fn handler() -> Html<&'static str> {
    Html(FORM_PAGE)
}
