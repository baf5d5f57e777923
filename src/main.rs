fn main() {
    jolang::cli::run();
}
