//! HTML fixtures shaped like rendered community pages

pub const AVATAR: &str = r#"<a class="abc X1U4Ie" href="./112233"><img src="//lh3.googleusercontent.com/ada.png"></a>"#;

pub fn header(meta: &str) -> String {
    format!(
        r#"<div class="xyz dzuq1e">
            {avatar}
            <div class="nMlfCf">
                <div class="Cd5D8b"><div class="xHn24c"><a href="./112233">Ada Lovelace</a></div></div>
                <div class="eRzjb">{meta}</div>
            </div>
        </div>"#,
        avatar = AVATAR,
        meta = meta
    )
}

pub fn permalink(path: &str, age: &str) -> String {
    format!(r#"<a class="qXj2He" href=".{}"><span>{}</span></a>"#, path, age)
}

pub fn pinned_link(path: &str) -> String {
    format!(r#"<div class="DsIcbd"><a class="QXSTae" href=".{}">Pinned</a></div>"#, path)
}

pub fn plain_text(text: &str) -> String {
    format!(r#"<div class="ELUvyf"><div><div><div>{}</div></div></div></div>"#, text)
}

pub fn reshare_text(text: &str) -> String {
    format!(r#"<div class="WIyZac"><div><div>{}</div></div></div>"#, text)
}

pub fn reshare_caption(text: &str) -> String {
    format!(
        r#"<div class="tjHUud"><div class="RriDEe"><div class="q ahil4d"><span>{}</span></div></div></div>"#,
        text
    )
}

pub fn attachment_image(src: &str) -> String {
    format!(
        r#"<div class="tjHUud"><div class="njiUWc"><div><div><div><div><div><img src="{}"></div></div></div></div></div></div></div>"#,
        src
    )
}

pub fn reshare_image(src: &str) -> String {
    format!(
        r#"<div jsname="MTOxpb"><div><a href="https://example.com/"><div class="rr9Dof"><div class="E68jgf"><img src="{}"></div></div></a></div></div>"#,
        src
    )
}

pub fn link_preview_image(src: &str) -> String {
    format!(
        r#"<div class="tjHUud"><div class="njiUWc"><div><a href="https://example.com/"><div class="rr9Dof"><div class="E68jgf"><img src="{}"></div></div></a></div></div></div>"#,
        src
    )
}

pub fn reshare_link_preview_image(src: &str) -> String {
    format!(
        r#"<div jsname="MTOxpb"><div><div><div><div><div><img src="{}"></div></div></div></div></div></div>"#,
        src
    )
}

/// A post container wrapping the given header and body blocks
pub fn post(header: &str, body: &str) -> String {
    format!(r#"<div class="Ihwked UB6FKd hE2QI">{}{}</div>"#, header, body)
}

/// A regular post with text and an attached image
pub fn regular_post(id: &str, age: &str, text: &str) -> String {
    post(
        &header(&permalink(&format!("/communities/1234/posts/{}", id), age)),
        &format!("{}{}", plain_text(text), attachment_image("//lh3.googleusercontent.com/photo.jpg")),
    )
}

pub fn page(posts: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Community</title></head><body><div id=\"feed\">{}</div></body></html>",
        posts.join("\n")
    )
}
