//! Index page - a minimal upload form for the sheet endpoint.

/// Generate the upload form, pre-filled with the default number of copies.
pub fn generate_index_html(default_copies: u32) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Passport Photo Sheet</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 32rem;
            margin: 3rem auto;
            padding: 0 1rem;
            color: #222;
        }}
        h1 {{ font-size: 1.5rem; }}
        label {{ display: block; margin: 1rem 0 0.25rem; }}
        button {{ margin-top: 1.5rem; padding: 0.5rem 1.25rem; }}
        .hint {{ color: #666; font-size: 0.875rem; }}
    </style>
</head>
<body>
    <h1>Passport Photo Sheet</h1>
    <p class="hint">
        Upload a portrait. The background is removed, the photo is enhanced
        and copies are laid out on a printable A4 PDF.
    </p>
    <form action="/process" method="post" enctype="multipart/form-data">
        <label for="image">Photo</label>
        <input type="file" id="image" name="image" accept="image/*" required>

        <label for="copies">Copies</label>
        <input type="number" id="copies" name="copies" min="0" value="{default_copies}">

        <button type="submit">Create sheet</button>
    </form>
</body>
</html>
"##,
        default_copies = default_copies
    )
}
