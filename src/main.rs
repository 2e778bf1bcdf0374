#[actix_web::main]
async fn main() -> std::io::Result<()> {
    quiz_doc_server::run().await
}
