// AWS Lambda binary entry point
//
// Build with: cargo lambda build --release -p stack-protect-lambda

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    stack_protect_lambda::run().await
}
